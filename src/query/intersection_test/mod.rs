pub use self::intersection_test::intersection_test;
