#![allow(dead_code)]

mod fetcher;

pub use fetcher::*;
