pub mod route_policy;
