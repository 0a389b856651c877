//! Command implementations.

pub mod header;
pub mod import;
pub mod item;
pub mod save;
pub mod share;
pub mod show;

pub use self::header::execute_header;
pub use self::import::{execute_import, import_into};
pub use self::item::execute_item;
pub use self::save::execute_save;
pub use self::share::execute_share;
pub use self::show::execute_show;
