pub mod chrome;

pub use chrome::ChromeCapture;
