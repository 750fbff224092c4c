// Shared by every numbered test, each of which uses a subset
#![allow(dead_code)]

pub mod helpers;
