// 外部資料格式的解析：Foursquare JSON 與 TREC CSV
pub mod foursquare;
pub mod trec;
