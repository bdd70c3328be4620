// Integration tests for the OANDA client
//
// Organized by surface:
// - support: scripted in-memory transport
// - client_tests: request shape, status handling, decoding per operation
// - order_book_tests: snapshot fetch followed by vicinity extraction

mod client_tests;
mod order_book_tests;
mod support;
