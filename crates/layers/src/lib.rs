pub mod floors;
pub mod labels;
pub mod layer;
pub mod style;
pub mod symbology;

pub use floors::*;
pub use layer::*;
pub use style::*;
pub use symbology::*;
