mod test_rtc_loopback;
