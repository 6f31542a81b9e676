//! Output generation for the link store and the article store.
//!
//! # Submodules
//!
//! - [`json`]: Reads and writes the link store and writes article files
//!
//! # Output Structure
//!
//! ```text
//! matched_titles.json           # every matched link, rewritten after each day
//! articles/
//! ├── 2007-01-01/
//! │   ├── federal-reserve-holds-rates-steady
//! │   └── fed-minutes-show-split
//! └── 2007-01-02/
//!     └── ...
//! ```

pub mod json;
