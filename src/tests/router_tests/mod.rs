mod favorites_tests;
mod search_tests;
