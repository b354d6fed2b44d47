pub mod device;
pub mod ff;
pub mod uinput;
#[cfg(test)]
pub mod uinput_test;
