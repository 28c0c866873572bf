pub mod catalog_service;
pub mod dashboard_service;
pub mod document_service;
pub mod draft_service;
pub mod quote_service;
