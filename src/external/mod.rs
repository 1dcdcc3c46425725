pub mod client;
pub mod pokeapi;
