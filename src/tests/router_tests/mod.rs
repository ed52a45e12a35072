mod care_point_tests;
mod pet_report_tests;
mod routing_tests;
