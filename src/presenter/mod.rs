// file: src/presenter/mod.rs
// description: presenter module exports

pub mod terminal;

pub use terminal::TerminalPresenter;
