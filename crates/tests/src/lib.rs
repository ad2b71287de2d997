pub mod fixtures;

#[cfg(test)]
mod auth_tests;
#[cfg(test)]
mod admin_panel_tests;
#[cfg(test)]
mod hostel_tests;
