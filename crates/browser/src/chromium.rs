mod page;
mod session;
mod wait;

pub use page::ChromiumPage;
pub use session::ChromiumSession;
pub use wait::{ElementState, WaitStrategy};
