//! Output generation for a finished run.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── 081500.json
//!     └── 163000.json
//! ```

pub mod json;
