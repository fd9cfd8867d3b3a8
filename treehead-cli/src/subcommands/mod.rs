mod collapse;
pub use collapse::CollapseApp;

mod convert;
pub use convert::ConvertApp;

mod tree2dep;
pub use tree2dep::Tree2DepApp;

mod validate;
pub use validate::ValidateApp;
