// Handlers grouped by resource:
// public  - root, info, health and the unknown-endpoint fallback
// blogs   - GET is public, POST/PUT/DELETE run behind the JWT resolver
// users   - account listing and registration
// persons - phonebook CRUD
pub mod blogs;
pub mod persons;
pub mod public;
pub mod users;
