use clap::{Parser, Subcommand, ValueEnum};
use meadowrun_common::Direction;
use meadowrun_kernel::{GameConfig, ObstacleField, Session, clock_seed};
use meadowrun_render::{DebugTextRenderer, FrameScene, RenderView, Renderer, SceneLayout};
use meadowrun_tools::{SessionInspector, SimulationPlan, simulate};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meadowrun-cli", about = "Inspect and simulate meadowrun rounds")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML game config; defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, the effective config and the opening frame
    Info,
    /// Generate and print an obstacle field
    Obstacles {
        /// RNG seed; overrides the config seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Number of obstacles; overrides the config count
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Play one round headless at a fixed timestep
    Simulate {
        /// RNG seed; overrides the config seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Timestep in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Hold a strafe key for the whole run
        #[arg(long, value_enum)]
        strafe: Option<Strafe>,
        /// Press jump at these run times (seconds), comma separated
        #[arg(long, value_delimiter = ',')]
        jump_at: Vec<f32>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Strafe {
    Left,
    Right,
}

impl From<Strafe> for Direction {
    fn from(strafe: Strafe) -> Self {
        match strafe {
            Strafe::Left => Direction::Left,
            Strafe::Right => Direction::Right,
        }
    }
}

#[derive(Serialize)]
struct ObstacleDump {
    seed: u64,
    positions: Vec<[f32; 3]>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = GameConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("meadowrun-cli v{}", env!("CARGO_PKG_VERSION"));
            let session = Session::new(config)?;
            println!("{}", SessionInspector::summary(&session, 0.0));
            println!("--- config ---");
            print!("{}", session.config().to_yaml_string()?);

            let view = RenderView::from_camera(session.camera(), 16.0 / 9.0);
            let scene = FrameScene::build(
                &SceneLayout::default(),
                view.eye,
                session.obstacles().positions(),
                0.0,
            );
            print!("{}", DebugTextRenderer::new().render(&scene, &view));
        }
        Commands::Obstacles { seed, count, json } => {
            if let Some(count) = count {
                config.corridor.count = count;
            }
            config.validate()?;
            let seed = seed.or(config.seed).unwrap_or_else(clock_seed);
            let field = ObstacleField::generate(&config.corridor, seed);

            if json {
                let dump = ObstacleDump {
                    seed,
                    positions: field.positions().map(|p| p.to_array()).collect(),
                };
                println!("{}", serde_json::to_string_pretty(&dump)?);
            } else {
                println!("Obstacles: seed={seed} count={}", field.len());
                for (i, p) in field.positions().enumerate() {
                    println!("  [{i}] ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
                }
            }
        }
        Commands::Simulate {
            seed,
            dt,
            strafe,
            jump_at,
            json,
        } => {
            if seed.is_some() {
                config.seed = seed;
            }
            anyhow::ensure!(dt > 0.0 && dt.is_finite(), "--dt must be a positive number");
            let plan = SimulationPlan {
                delta_time: dt,
                strafe: strafe.map(Direction::from),
                jump_at,
                ..SimulationPlan::default()
            };
            let report = simulate(config, &plan)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
    }

    Ok(())
}
