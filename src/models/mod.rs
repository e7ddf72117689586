pub mod pore;
