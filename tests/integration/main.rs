//! Integration tests for contextflow.
//!
//! Each test builds its database files in a temporary sysconfdir, so no
//! external setup is needed:
//!
//! ```bash
//! cargo test -p integration-tests
//! ```

mod concurrency_test;
mod enrich_test;
mod init_test;
