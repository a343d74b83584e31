pub mod repository;
pub mod service;

pub use self::repository::{
    DynInventoryCommandRepository, DynInventoryQueryRepository, InventoryCommandRepositoryTrait,
    InventoryQueryRepositoryTrait, InventoryTransaction, InventoryWriter,
};
pub use self::service::{
    DynInventoryCommandService, DynInventoryQueryService, InventoryCommandServiceTrait,
    InventoryQueryServiceTrait,
};
