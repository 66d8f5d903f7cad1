pub mod clock;
pub mod file;
pub mod memory;

pub use clock::{ManualClock, SystemClock};
pub use file::{JsonNameFile, NAME_FILE_NAME};
pub use memory::InMemoryNameStore;
