pub mod auth;
pub mod dashboard;
pub mod enderecos;
pub mod ferias;
pub mod health;
pub mod relatorios;
pub mod servidores;
pub mod users;
