pub mod ccd;
pub mod lowpass;
pub mod reach;
