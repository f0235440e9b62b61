/*!
# Overview
eadirm-rs removes Synology `@eaDir` metadata directories from a remote host
that is reachable only over a restricted shell.

It enumerates the remote tree with an rsync dry run, normalizes the listing
to the top-level `@eaDir` directories, and deletes them in batches over ssh.
Progress is tracked in a local queue file, so an interrupted run resumes
where it stopped instead of re-scanning.

## Features
- **No remote agent**: only `ssh` and `rsync` on the local side, a plain
  shell on the remote side
- **Resumable**: a crash-safe on-disk queue survives interruption
- **Safety first**: dry-run mode, confirmation prompt, force flag
- **Library-first**: the `eadirm` CLI is a thin wrapper over this crate

## As a Library

```toml
[dependencies]
eadirm-rs = "0.1"
tokio = { version = "1", features = ["full"] }
```

```no_run
// use eadirm_rs::Config;
// use eadirm_rs::SweepPipeline;
// use eadirm_rs::types::token::create_pipeline_cancellation_token;
//
// #[tokio::main(flavor = "current_thread")]
// async fn main() {
//     let config = Config::for_target("admin@nas", "/volume1/music");
//     let cancellation_token = create_pipeline_cancellation_token();
//     let mut pipeline = SweepPipeline::new(config, cancellation_token);
//
//     if let Err(e) = pipeline.run().await {
//         eprintln!("{e:?}");
//     }
//     println!("deleted: {}", pipeline.stats().deleted);
// }
```
*/

#![allow(clippy::assertions_on_constants)]

pub mod config;
pub mod deleter;
pub mod filter;
pub mod lister;
pub mod pipeline;
pub mod queue;
pub mod remote;
pub mod safety;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use config::args::CLIArgs;
pub use pipeline::SweepPipeline;
pub use types::error::{exit_code_from_error, is_cancelled_error};
pub use types::token::{PipelineCancellationToken, create_pipeline_cancellation_token};
