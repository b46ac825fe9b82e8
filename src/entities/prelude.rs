pub use super::products::Entity as Products;
