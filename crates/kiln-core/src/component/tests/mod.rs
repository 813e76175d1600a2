mod registry_tests;
