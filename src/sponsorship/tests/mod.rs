mod common;
mod region;
mod selection;
