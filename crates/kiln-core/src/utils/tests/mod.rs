mod panic_tests;
