/// CRUD operations tests for all models; require a reachable Postgres.
pub mod crud_tests;
