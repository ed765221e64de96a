mod test_leave_room_tears_down;
