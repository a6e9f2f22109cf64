pub mod memory;
pub mod serial;
pub mod transport;

pub use memory::{MemoryTransport, ScriptEvent, ScriptedOpener};
pub use serial::{LinkState, SerialLink};
pub use transport::{available_ports, SerialOpener, SerialTransport};
