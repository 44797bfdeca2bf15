pub mod console_controllers;
