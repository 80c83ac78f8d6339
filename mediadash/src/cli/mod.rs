pub mod bugreport;
pub mod client;
pub mod config;
pub mod prompt;
pub mod version;

pub const DEFAULT_URI: &str = "http://localhost:5000";
pub const URI_ENV: &str = "MEDIADASH_URI";
pub const TOKEN_ENV: &str = "MEDIADASH_TOKEN";
pub const SESSION_ENV: &str = "MEDIADASH_SESSION_FILE";

pub const VERSION_SUBCOMMAND: &str = "version";
pub const VERSION_DESCRIPTION: &str = "Display the version and build information";

pub const BUGREPORT_SUBCOMMAND: &str = "bugreport";
pub const BUGREPORT_DESCRIPTION: &str = "Collect information useful for a bug report";

pub const LIST_SUBCOMMAND: &str = "list";
pub const LIST_DESCRIPTION: &str = "List stored files of a category, optionally narrowed by search text";

pub const STATS_SUBCOMMAND: &str = "stats";
pub const STATS_DESCRIPTION: &str = "Show file counts and sizes per category";

pub const PATH_SUBCOMMAND: &str = "path";
pub const PATH_DESCRIPTION: &str = "Show the storage root directory of the service";

pub const UPLOAD_SUBCOMMAND: &str = "upload";
pub const UPLOAD_DESCRIPTION: &str = "Upload files as one batch";

pub const DROP_SUBCOMMAND: &str = "drop";
pub const DROP_DESCRIPTION: &str = "Upload files dragged into the terminal (paths are read from stdin)";

pub const KEEP_SUBCOMMAND: &str = "keep";
pub const KEEP_DESCRIPTION: &str = "Keep a file permanently";

pub const EXPIRE_SUBCOMMAND: &str = "expire";
pub const EXPIRE_DESCRIPTION: &str = "Let a file expire 7 days after upload";

pub const DELETE_SUBCOMMAND: &str = "delete";
pub const DELETE_DESCRIPTION: &str = "Delete a file, this cannot be undone";

pub const PROCESS_SUBCOMMAND: &str = "process";
pub const PROCESS_DESCRIPTION: &str = "Start knowledge processing of a file in the background";

pub const CONTENT_SUBCOMMAND: &str = "content";
pub const CONTENT_DESCRIPTION: &str = "Download file content";
