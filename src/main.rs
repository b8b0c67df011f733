use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};

use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use authz_eng::Engine;
use authz_eng::json::{read_events, write_outcome};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(io::stderr)
        .init();

    let mut engine = Engine::new();
    let (event_sender, event_receiver) = tokio::sync::mpsc::channel(16);

    // Events are parsed on a reader task and handed to the engine over a
    // channel; bad lines are logged and skipped.
    let path = env::args().nth(1);
    tokio::spawn(async move {
        let reader: Box<dyn io::BufRead + Send> = match &path {
            Some(path) => match File::open(path) {
                Ok(file) => Box::new(BufReader::new(file)),
                Err(e) => {
                    warn!(path = %path, "cannot open input: {e}");
                    return;
                }
            },
            None => Box::new(BufReader::new(io::stdin())),
        };

        for result in read_events(reader) {
            match result {
                Ok(event) => {
                    if event_sender.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    engine
        .run(ReceiverStream::new(event_receiver), |outcome| {
            write_outcome(&mut out, &outcome).expect("failed to write outcome");
        })
        .await;

    out.flush().expect("failed to flush stdout");
}
