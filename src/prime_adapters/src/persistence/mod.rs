pub mod hashmap_user_directory;
pub mod postgres_user_directory;

pub use hashmap_user_directory::HashMapUserDirectory;
pub use postgres_user_directory::PostgresUserDirectory;
