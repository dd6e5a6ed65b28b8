pub mod console;
pub mod http;
pub mod socket_io;
