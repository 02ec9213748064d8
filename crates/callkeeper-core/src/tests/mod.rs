mod capture;
mod storage;
mod support;
