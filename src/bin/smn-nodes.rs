use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use ndarray::{Array3, Axis, stack};
use tracing_subscriber::EnvFilter;

use smn_nodes::nodes::json;
use smn_nodes::{
    FrameLayout, HostConfig, ImageBatch, WebmRequest, from_raster, registry, run_webm,
};

#[derive(Parser, Debug)]
#[command(name = "smn-nodes", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered nodes.
    List {
        /// Also print each node's input declaration as JSON.
        #[arg(long)]
        inputs: bool,
    },
    /// Encode a directory of images to WebM (requires `ffmpeg` on PATH).
    Webm(WebmArgs),
    /// Query JSON text the way the JSON nodes do.
    #[command(subcommand)]
    Json(JsonCommand),
}

#[derive(Parser, Debug)]
struct WebmArgs {
    /// Directory of PNG/JPEG frames, encoded in file-name order.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Output name, relative to the output root.
    #[arg(long)]
    out: String,

    #[arg(long, default_value_t = 25)]
    framerate: u32,

    #[arg(long, default_value_t = 10.0)]
    bitrate_mb: f64,

    /// Output root; overrides the config file.
    #[arg(long)]
    output_root: Option<PathBuf>,

    /// Host config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Channel layout of the loaded frames.
    #[arg(long, value_enum)]
    layout: Option<LayoutChoice>,
}

#[derive(Subcommand, Debug)]
enum JsonCommand {
    /// Value under KEY of a JSON object.
    Key { json: String, key: String },
    /// Element INDEX of a JSON array.
    Index { json: String, index: i64 },
    /// Bool/int/float/string views of a JSON value.
    As { value: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutChoice {
    Auto,
    ChannelsLast,
    ChannelsFirst,
}

impl From<LayoutChoice> for FrameLayout {
    fn from(v: LayoutChoice) -> Self {
        match v {
            LayoutChoice::Auto => Self::Auto,
            LayoutChoice::ChannelsLast => Self::ChannelsLast,
            LayoutChoice::ChannelsFirst => Self::ChannelsFirst,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::List { inputs } => cmd_list(inputs),
        Command::Webm(args) => cmd_webm(args),
        Command::Json(cmd) => cmd_json(cmd),
    }
}

fn cmd_list(inputs: bool) -> anyhow::Result<()> {
    for entry in registry().entries() {
        let schema = entry.node.schema();
        println!("{}\t{}\t{}", entry.id, entry.title, schema.category);
        if inputs {
            println!("  {}", serde_json::to_string(&schema.input_types())?);
        }
    }
    Ok(())
}

fn load_frames(dir: &Path) -> anyhow::Result<ImageBatch> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("read frame dir '{}'", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
        })
        .collect();
    files.sort();
    anyhow::ensure!(!files.is_empty(), "no PNG/JPEG files in '{}'", dir.display());

    let mut frames = Vec::with_capacity(files.len());
    for path in &files {
        let img = image::open(path)
            .with_context(|| format!("decode '{}'", path.display()))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        let raster = Array3::from_shape_vec((h as usize, w as usize, 4), img.into_raw())
            .with_context(|| format!("reshape '{}'", path.display()))?;
        frames.push(from_raster(raster.view()));
    }
    let views: Vec<_> = frames.iter().map(|f| f.view()).collect();
    let batch = stack(Axis(0), &views).context("frames must all have the same size")?;
    Ok(ImageBatch::F32(batch.into_dyn()))
}

fn cmd_webm(args: WebmArgs) -> anyhow::Result<()> {
    let mut host = match &args.config {
        Some(path) => HostConfig::from_path(path)?,
        None => HostConfig::default(),
    };
    if let Some(root) = args.output_root {
        host = host.with_output_dir(root);
    }

    let images = load_frames(&args.in_dir)?;
    let mut req = WebmRequest::new(images, args.out);
    req.framerate = args.framerate;
    req.bitrate_mb = args.bitrate_mb;
    req.layout = args.layout.map(FrameLayout::from);

    let report = run_webm(&host, &req);
    print!("{}", report.log_text());
    anyhow::ensure!(report.success(), "webm export failed; see log above");

    eprintln!("wrote {}", report.output_file.display());
    Ok(())
}

fn cmd_json(cmd: JsonCommand) -> anyhow::Result<()> {
    match cmd {
        JsonCommand::Key { json: text, key } => println!("{}", json::key_value(&text, &key)),
        JsonCommand::Index { json: text, index } => {
            println!("{}", json::index_value(&text, index))
        }
        JsonCommand::As { value } => {
            let v = json::value_as(&value);
            println!("as_bool\t{}", v.as_bool);
            println!("as_int\t{}", v.as_int);
            println!("as_float\t{}", v.as_float);
            println!("as_string\t{}", v.as_string);
        }
    }
    Ok(())
}
