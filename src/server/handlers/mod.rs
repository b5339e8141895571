pub mod capture;
pub mod maps;
pub mod routes;
pub mod zones;
