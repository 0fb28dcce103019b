/// Bus router tests.
pub mod interconnect;




/// VGA register file tests.
pub mod vga;
