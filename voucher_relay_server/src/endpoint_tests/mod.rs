mod helpers;
mod mocks;
mod vouchers;
