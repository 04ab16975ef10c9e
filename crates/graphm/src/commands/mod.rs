//! Command handlers, one module per subcommand.

pub mod completion;
pub mod config_cmd;
pub mod decode;
pub mod edit;
pub mod roundtrip;
pub mod types_cmd;
pub mod version;
