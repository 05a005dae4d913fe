use std::process::ExitCode;

use log::{ error, warn, info, debug };
use tokio::sync::mpsc;

use shooter::{ capture, logging, CancelToken, CaptureResult, Job, Outcome, Shooter };
use shooter::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // logging is not up yet, config errors go to stderr
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("loading config failed. {e}");
            return ExitCode::FAILURE;
        },
    };

    // initializing logger
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("unable to initialize logging. {e}");
        return ExitCode::FAILURE;
    }

    let job = match Job::from_settings(&config.shooter) {
        Ok(j) => j,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        },
    };

    let camera = capture::build(&config.camera);

    // ctrl-c is the cancel affordance
    let token = CancelToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("interrupted. cancelling run.");
                    token.request_cancel();
                },
                Err(e) => warn!("unable to listen for ctrl-c. {e}"),
            }
        });
    }

    let (tx, mut rx) = mpsc::channel::<CaptureResult>(config.general.queue);
    let saved = tokio::spawn(async move {
        while let Some(c) = rx.recv().await {
            info!("shot {} saved to {}", c.shot, c.path.display());
            debug!("{c:?}");
        }
    });

    let report = Shooter::new(config.camera.settle)
        .with_sink(tx)
        .start(job, camera, token)
        .wait()
        .await;

    if let Err(e) = saved.await {
        warn!("result logger ended abnormally. {e}");
    }

    match report.outcome {
        Outcome::Succeeded => {
            info!("run complete. {}/{} shot(s) taken.", report.taken, report.total);
            ExitCode::SUCCESS
        },
        Outcome::Cancelled => {
            info!("run cancelled. {}/{} shot(s) taken.", report.taken, report.total);
            ExitCode::SUCCESS
        },
        Outcome::Failed(e) => {
            error!("run failed after {}/{} shot(s). {e}", report.taken, report.total);
            ExitCode::FAILURE
        },
    }
}
