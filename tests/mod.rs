mod memory;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - memory: In-memory calendar, workspace and trigger registry doubles
// - smoke_tests: Configuration and wiring of the in-memory services
// - pipeline_tests: Generation and replay runs end to end
// - trigger_tests: Replay trigger pruning and the monthly schedule
