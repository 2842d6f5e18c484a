pub mod item;
pub mod page;
pub mod selection;
pub mod total;

pub use item::*;
pub use page::*;
pub use selection::*;
pub use total::*;
