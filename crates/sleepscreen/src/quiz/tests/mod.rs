mod common;
mod flags;
mod gating;
mod service;
