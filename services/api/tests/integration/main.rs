mod helpers;

mod diet_test;
mod patient_test;
mod router_test;
