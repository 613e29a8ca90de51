use sarbaz::{Config, run};

fn main() -> anyhow::Result<()> {
    // Zero means one worker per core, tokio's own default.
    let workers = Config::load()?.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if workers > 0 {
        builder.worker_threads(workers);
    }

    builder.build()?.block_on(run())
}
