mod level;
mod replay;
mod session;

use std::path::PathBuf;
use std::time::Duration;

use stepdx_core::time::FrameClock;
use stepdx_render::count_texture_binds;

use level::load_level_from_path;
use replay::load_replay_from_path;
use session::Session;

const DEFAULT_LEVEL_PATH: &str = "assets/levels/playground.json";
const DEFAULT_REPLAY_PATH: &str = "assets/replays/walk_and_jump.json";
const VIEWPORT: (u32, u32) = (1024, 256);
const PROGRESS_INTERVAL: u64 = 60;

struct Args {
    level_path: PathBuf,
    replay_path: PathBuf,
    realtime: bool,
}

fn usage() -> String {
    "Usage: stepdx_game [level.json] [replay.json] [--realtime]".to_string()
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut realtime = false;
    for arg in args {
        match arg.as_str() {
            "--realtime" => realtime = true,
            "-h" | "--help" => return Err(usage()),
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown flag '{flag}'\n{}", usage()));
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    if positional.len() > 2 {
        return Err(usage());
    }
    let mut positional = positional.into_iter();
    Ok(Args {
        level_path: positional
            .next()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEVEL_PATH)),
        replay_path: positional
            .next()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPLAY_PATH)),
        realtime,
    })
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("StepDX starting...");

    let args = parse_args(std::env::args().skip(1))?;

    let level = load_level_from_path(&args.level_path).unwrap_or_else(|err| {
        panic!(
            "Failed to load initial level '{}': {}",
            args.level_path.display(),
            err
        );
    });
    let replay = load_replay_from_path(&args.replay_path).unwrap_or_else(|err| {
        panic!(
            "Failed to load replay '{}': {}",
            args.replay_path.display(),
            err
        );
    });
    log::info!(
        "Loaded level '{}' ({} shapes) and {} replay frames at {:.4}s",
        level.level_id,
        level.world.shapes().len(),
        replay.frame_count(),
        replay.frame_dt
    );

    let mut session = Session::new(level, VIEWPORT);
    let mut clock = FrameClock::new();
    let frame_time = Duration::from_secs_f32(replay.frame_dt);

    for input in replay.expanded_inputs() {
        if !session.handle_input(&input) {
            log::info!("Quit requested after {} frames", clock.frame_count);
            break;
        }

        let dt = if args.realtime {
            std::thread::sleep(frame_time);
            clock.begin_frame()
        } else {
            clock.advance_by(replay.frame_dt)
        };
        let step = session.step(dt);

        let mesh = session.mesh();
        let uniform = session.camera().build_uniform();
        let upload_bytes = mesh.vertex_bytes().len()
            + mesh.index_bytes().len()
            + bytemuck::bytes_of(&uniform).len();

        let actor = session.world().actor();
        let pos = actor.kinematics().map(|body| body.pos).unwrap_or_default();
        log::debug!(
            "frame {}: dt {:.4} substeps {} contacts {} actor ({:.3}, {:.3}) upload {} bytes",
            clock.frame_count,
            dt,
            step.substeps,
            step.contacts,
            pos.x,
            pos.y,
            upload_bytes
        );
        if clock.frame_count % PROGRESS_INTERVAL == 0 {
            log::info!(
                "frame {}: actor at ({:.2}, {:.2}), camera x {:.2}, {:.1} fps, {} draw calls / {} binds",
                clock.frame_count,
                pos.x,
                pos.y,
                session.camera().position.x,
                clock.smoothed_fps,
                mesh.draw_calls().len(),
                count_texture_binds(mesh.draw_calls())
            );
        }
    }

    let stats = session.stats();
    let pos = session
        .world()
        .actor()
        .kinematics()
        .map(|body| body.pos)
        .unwrap_or_default();
    log::info!(
        "Level '{}' finished: {} frames, {:.3}s simulated, {} substeps, {} contacts, actor at ({:.3}, {:.3})",
        session.level_id(),
        stats.frames,
        stats.simulated,
        stats.substeps,
        stats.contacts,
        pos.x,
        pos.y
    );
    Ok(())
}
