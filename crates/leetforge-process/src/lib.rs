//! # leetforge-process
//!
//! Runs target-language toolchains (`go`, `python3`, `cargo`, user scripts)
//! as child processes: stdin feeding, stdout/stderr capture, per-run
//! timeouts and process-group kill on expiry.
//!
//! ```rust,no_run
//! use leetforge_process::{ProcessManager, ProcessConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ProcessManager::new();
//! let config = ProcessConfig::new("python3")
//!     .args(["0001.two-sum/solution.py"])
//!     .stdin("[2,7,11,15]\n9\n")
//!     .timeout_secs(10);
//!
//! let output = manager.run(config).await?;
//! assert!(output.success());
//! # Ok(())
//! # }
//! ```

pub mod child;
pub mod config;
pub mod error;
pub mod manager;

pub use child::ManagedChild;
pub use config::{ProcessConfig, ProcessOutput};
pub use error::{ProcessError, Result};
pub use manager::ProcessManager;
