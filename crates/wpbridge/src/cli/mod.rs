mod app;
mod import;
mod inspect;

pub use app::App;
