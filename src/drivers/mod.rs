pub mod shanwan;
