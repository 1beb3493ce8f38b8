//! Proxy page fixtures and mock server helpers

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Rendered Xiaohongshu list with five items, trend markers and a tooltip
pub const XHS_PAGE: &str = "\
Title: 今日热榜 - 小红书

URL Source: https://rebang.today/?tab=xiaohongshu

Markdown Content:
*   1
[棋圣聂卫平病逝 新 ----------](https://www.xiaohongshu.com/search_result?keyword=%E6%A3%8B%E5%9C%A3%E8%81%82%E5%8D%AB%E5%B9%B3%E7%97%85%E9%80%9D \"棋圣聂卫平病逝\")
948.1w

*   2
[冬天的第一杯奶茶 热 ----------](https://www.xiaohongshu.com/explore/abc)
52.3w

*   3
[周末去哪儿](https://www.xiaohongshu.com/explore/def)
8000

*   4
[年终总结模板](https://www.xiaohongshu.com/explore/ghi)
3.5k

*   5
[早八通勤妆](https://www.xiaohongshu.com/explore/jkl)
1.1万
";

/// Rendered NetEase list; the second headline has no comment count
pub const NE_NEWS_PAGE: &str = "\
* [![Image 1](https://cms-bucket.ws.126.net/1.jpg)](https://c.m.163.com/news/a/A1.html) [国内油价迎来年内第十次下调](https://c.m.163.com/news/a/A1.html \"国内油价迎来年内第十次下调\")加满一箱省十元
新京报 2380人跟贴
* [多地发布寒潮预警 -----](https://c.m.163.com/news/a/B2.html)气温骤降
央视新闻
* [航天员乘组顺利返回地球](https://c.m.163.com/news/a/C3.html)
人民日报 1.2万人跟贴
";

/// Serve `body` as the proxy page for `tab`
pub async fn mount_feed(server: &MockServer, tab: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("tab", tab))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve `bytes` at `route`
pub async fn mount_resource(server: &MockServer, route: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .mount(server)
        .await;
}

/// Answer `status` at `route`, expecting exactly `hits` requests
pub async fn mount_failing(server: &MockServer, route: &str, status: u16, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .expect(hits)
        .mount(server)
        .await;
}
