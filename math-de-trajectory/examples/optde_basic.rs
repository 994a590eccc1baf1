use math_de_trajectory::{Boundary, DEConfigBuilder, differential_evolution};
use ndarray::Array1;

fn main() {
    // Ackley function (2D)
    let ackley = |x: &Array1<f64>| {
        let x0 = x[0];
        let x1 = x[1];
        let s = 0.5 * (x0 * x0 + x1 * x1);
        let c = 0.5
            * ((2.0 * std::f64::consts::PI * x0).cos() + (2.0 * std::f64::consts::PI * x1).cos());
        -20.0 * (-0.2 * s.sqrt()).exp() - c.exp() + 20.0 + std::f64::consts::E
    };

    let config = DEConfigBuilder::new()
        .bounds(vec![(-5.0, 5.0), (-5.0, 5.0)])
        .popsize(20)
        .maxiter(300)
        .mutation(0.7)
        .recombination(0.9)
        .boundary(Boundary::Clip)
        .seed(42)
        .build()
        .expect("valid config");

    let report = differential_evolution(&ackley, config).expect("optimization failed");
    println!(
        "f={:.6e}, x=[{:.4}, {:.4}], nit={}, nfev={}",
        report.fun, report.x[0], report.x[1], report.nit, report.nfev
    );

    // How far each generation's agents sit from the optimum, on average.
    for (it, snapshot) in report.trajectory.iter().enumerate().step_by(50) {
        let spread = snapshot
            .rows()
            .into_iter()
            .map(|row| row.dot(&row).sqrt())
            .sum::<f64>()
            / snapshot.nrows() as f64;
        println!("iter {:4}  best_f={:.6e}  mean |x|={:.3e}", it + 1, report.history[it], spread);
    }
}
