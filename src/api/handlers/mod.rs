pub mod ladder;
pub mod pages;
