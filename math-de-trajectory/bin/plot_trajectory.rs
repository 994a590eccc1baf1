use clap::Parser;
use directories::ProjectDirs;
use math_de_trajectory::Trajectory;
use math_de_trajectory::function_registry::{FunctionRegistry, TestFunction};
use ndarray::{Array1, ArrayView2};
use plotly::{
    Layout, Plot, Scatter,
    common::{ColorScale, ColorScalePalette, Marker, MarkerSymbol, Mode, Title},
    contour::Contour,
    layout::Axis,
};
use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::filter::LevelFilter;

/// Get the data generated directory using the directories crate
fn get_data_generated_dir() -> Result<PathBuf, String> {
    let proj_dirs = ProjectDirs::from("org", "spinorama", "math-audio")
        .ok_or("Failed to determine project directories")?;

    Ok(proj_dirs
        .cache_dir()
        .join("data_generated")
        .join("plot_trajectory"))
}

/// CLI arguments for plotting a recorded trajectory
#[derive(Parser)]
#[command(name = "plot_trajectory")]
#[command(about = "Plot every generation of a recorded 2-D trajectory with Plotly")]
struct Args {
    /// Trajectory CSV written by run_de --trajectory-csv
    input: PathBuf,

    /// Registry function drawn as a contour behind the agents
    #[arg(short, long)]
    function: Option<String>,

    /// X-axis bounds (min,max); defaults to the function's bounds or -15,15
    #[arg(long, allow_hyphen_values = true)]
    x_bounds: Option<String>,

    /// Y-axis bounds (min,max); defaults to the function's bounds or -15,15
    #[arg(long, allow_hyphen_values = true)]
    y_bounds: Option<String>,

    /// Output directory, removed and recreated on every run
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Height of the plot in pixels
    #[arg(short = 'H', long, default_value = "800")]
    height: usize,

    /// Width of the plot in pixels
    #[arg(short = 'W', long, default_value = "800")]
    width: usize,

    /// Contour grid resolution along each axis
    #[arg(long, default_value = "100")]
    grid: usize,

    /// Delay between frames of the animation, in milliseconds
    #[arg(long, default_value = "250")]
    delay_ms: u64,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose > 0 {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let trajectory = Trajectory::read_csv(&args.input)?;
    if trajectory.dimension() != 2 {
        return Err(format!(
            "only 2-D trajectories can be plotted, got {}D",
            trajectory.dimension()
        )
        .into());
    }
    log::info!(
        "Loaded {} iterations x {} agents from {}",
        trajectory.len(),
        trajectory.population_size(),
        args.input.display()
    );

    let registry = FunctionRegistry::new();
    let background = match &args.function {
        Some(name) => {
            let info = registry
                .info(name)
                .ok_or_else(|| format!("function '{}' not found", name))?;
            Some((name.as_str(), info.func, info.bounds))
        }
        None => None,
    };

    let default_bounds = background.map_or((-15.0, 15.0), |(_, _, b)| b);
    let x_bounds = match &args.x_bounds {
        Some(s) => parse_bounds(s)?,
        None => default_bounds,
    };
    let y_bounds = match &args.y_bounds {
        Some(s) => parse_bounds(s)?,
        None => default_bounds,
    };

    let output_dir = match args.output_dir {
        Some(dir) => dir,
        None => get_data_generated_dir()?,
    };
    if output_dir.exists() {
        fs::remove_dir_all(&output_dir)?;
    }
    fs::create_dir_all(&output_dir)?;

    let contour = background.map(|(_, func, _)| grid_values(func, x_bounds, y_bounds, args.grid));
    let title = background.map_or("trajectory", |(name, _, _)| name);

    let mut frames = Vec::with_capacity(trajectory.len());
    let mut frames_json = Vec::with_capacity(trajectory.len());
    for (iteration, snapshot) in trajectory.iter().enumerate() {
        let mut plot = Plot::new();
        if let Some((xs, ys, zs)) = &contour {
            plot.add_trace(
                Contour::new(xs.clone(), ys.clone(), zs.clone())
                    .color_scale(ColorScale::Palette(ColorScalePalette::Viridis)),
            );
        }
        add_agents(&mut plot, snapshot);

        let layout = Layout::new()
            .title(Title::with_text(format!(
                "{}: iteration {}",
                title,
                iteration + 1
            )))
            .width(args.width)
            .height(args.height)
            .x_axis(
                Axis::new()
                    .title(Title::with_text("x0"))
                    .range(vec![x_bounds.0, x_bounds.1]),
            )
            .y_axis(
                Axis::new()
                    .title(Title::with_text("x1"))
                    .range(vec![y_bounds.0, y_bounds.1]),
            );
        plot.set_layout(layout);

        let filename = format!("iter_{:04}.html", iteration + 1);
        plot.write_html(output_dir.join(&filename));
        log::debug!("  Created {}", filename);
        frames.push(filename);
        frames_json.push(plot.to_json());
    }

    fs::write(
        output_dir.join(ANIMATION_FILE),
        animation_html(title, &frames_json, args.delay_ms),
    )?;
    write_index(&output_dir, title, &frames)?;
    println!(
        "Wrote {} frames, {} and index.html to {}",
        frames.len(),
        ANIMATION_FILE,
        output_dir.display()
    );
    Ok(())
}

const ANIMATION_FILE: &str = "animation.html";

/// One page that plays every frame in order, with a slider and a play/pause button.
fn animation_html(title: &str, frames_json: &[String], delay_ms: u64) -> String {
    let last = frames_json.len().saturating_sub(1);
    format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8">
<title>{title}</title>
<script src="https://cdn.plot.ly/plotly-3.1.0.min.js"></script>
</head><body>
<h1>{title}</h1>
<div id="plot-display"></div>
<div>
  <button id="play">Pause</button>
  <input id="frame" type="range" min="0" max="{last}" value="0" style="width: 600px">
  <span id="label">1 / {count}</span>
</div>
<script>
const frames = [{frames}];
const slider = document.getElementById('frame');
const label = document.getElementById('label');
const button = document.getElementById('play');
let current = 0;
let timer = null;

async function show(i) {{
  current = i;
  slider.value = i;
  label.textContent = (i + 1) + ' / ' + frames.length;
  await Plotly.react('plot-display', frames[i].data, frames[i].layout);
}}

function play() {{
  button.textContent = 'Pause';
  timer = setInterval(() => show((current + 1) % frames.length), {delay_ms});
}}

function pause() {{
  button.textContent = 'Play';
  clearInterval(timer);
  timer = null;
}}

button.addEventListener('click', () => (timer === null ? play() : pause()));
slider.addEventListener('input', () => {{
  pause();
  show(Number(slider.value));
}});

show(0).then(play);
</script>
</body></html>
"#,
        title = title,
        last = last,
        count = frames_json.len(),
        frames = frames_json.join(",\n"),
        delay_ms = delay_ms,
    )
}

fn add_agents(plot: &mut Plot, snapshot: ArrayView2<'_, f64>) {
    let x_coords: Vec<f64> = snapshot.column(0).to_vec();
    let y_coords: Vec<f64> = snapshot.column(1).to_vec();

    let agents = Scatter::new(x_coords, y_coords)
        .mode(Mode::Markers)
        .name("Agents")
        .marker(
            Marker::new()
                .color("rgba(255, 0, 0, 0.9)")
                .size(8)
                .symbol(MarkerSymbol::Circle),
        );
    plot.add_trace(agents);
}

fn grid_values(
    func: TestFunction,
    x_bounds: (f64, f64),
    y_bounds: (f64, f64),
    n: usize,
) -> (Vec<f64>, Vec<f64>, Vec<Vec<f64>>) {
    let n = n.max(2);
    let x_vals: Vec<f64> = (0..n)
        .map(|i| x_bounds.0 + (x_bounds.1 - x_bounds.0) * i as f64 / (n - 1) as f64)
        .collect();
    let y_vals: Vec<f64> = (0..n)
        .map(|i| y_bounds.0 + (y_bounds.1 - y_bounds.0) * i as f64 / (n - 1) as f64)
        .collect();

    let mut z_vals = Vec::with_capacity(n);
    for &y in &y_vals {
        let row: Vec<f64> = x_vals
            .iter()
            .map(|&x| func(&Array1::from(vec![x, y])))
            .collect();
        z_vals.push(row);
    }
    (x_vals, y_vals, z_vals)
}

fn write_index(dir: &Path, title: &str, frames: &[String]) -> std::io::Result<()> {
    let mut html = String::new();
    let _ = writeln!(html, "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>{}</title></head><body>", title);
    let _ = writeln!(html, "<h1>{} ({} iterations)</h1>", title, frames.len());
    let _ = writeln!(html, "<p><a href=\"{0}\">{0}</a></p>\n<ol>", ANIMATION_FILE);
    for frame in frames {
        let _ = writeln!(html, "<li><a href=\"{0}\">{0}</a></li>", frame);
    }
    let _ = writeln!(html, "</ol></body></html>");
    fs::write(dir.join("index.html"), html)
}

fn parse_bounds(bounds_str: &str) -> Result<(f64, f64), Box<dyn std::error::Error>> {
    let cleaned = bounds_str.trim_matches(|c| c == '\'' || c == '"');
    let parts: Vec<&str> = if cleaned.contains(',') {
        cleaned.split(',').collect()
    } else {
        cleaned.split_whitespace().collect()
    };

    if parts.len() != 2 {
        return Err("Bounds must be in format 'min,max' or 'min max'".into());
    }

    let min: f64 = parts[0].trim().parse()?;
    let max: f64 = parts[1].trim().parse()?;
    if min >= max {
        return Err(format!("Bounds require min < max, got {min},{max}").into());
    }
    Ok((min, max))
}
