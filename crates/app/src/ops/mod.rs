pub mod add;
pub mod cat;
pub mod init;
pub mod ls;
pub mod mkdir;
pub mod pins;
pub mod sync;
pub mod version;

pub use add::Add;
pub use cat::Cat;
pub use init::Init;
pub use ls::Ls;
pub use mkdir::Mkdir;
pub use pins::Pins;
pub use version::Version;
